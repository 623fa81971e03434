use utoipa::OpenApi;

#[derive(OpenApi)]
/// Aggregated OpenAPI specification for Spot the Bot Back.
#[openapi(
    paths(
        crate::routes::health::healthcheck,
        crate::routes::game::start_game,
        crate::routes::game::next_question,
        crate::routes::game::submit_answer,
        crate::routes::admin::login,
        crate::routes::admin::questions,
        crate::routes::admin::bulk_upload,
        crate::routes::admin::init_database,
    ),
    components(
        schemas(
            crate::dto::health::HealthResponse,
            crate::dto::game::StartGameRequest,
            crate::dto::game::StartGameResponse,
            crate::dto::game::NextQuestionResponse,
            crate::dto::game::QuestionView,
            crate::dto::game::SubmitAnswerRequest,
            crate::dto::game::SubmitAnswerResponse,
            crate::state::session::Difficulty,
            crate::state::session::AnswerSlot,
            crate::dto::admin::LoginRequest,
            crate::dto::admin::LoginResponse,
            crate::dto::admin::QuestionsRequest,
            crate::dto::admin::QuestionsResponse,
            crate::dto::admin::BulkUploadRequest,
            crate::dto::admin::BulkUploadResponse,
            crate::dto::admin::InitDatabaseRequest,
            crate::dto::admin::ActionResponse,
            crate::dao::models::QuestionEntity,
            crate::dao::models::QuestionPatch,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "game", description = "Player-facing game loop"),
        (name = "admin", description = "Key-gated question pool management"),
    )
)]
pub struct ApiDoc;
