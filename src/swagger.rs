use actix_web::web;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::handlers;
use crate::models::*;

#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::game::validate,
        handlers::game::draw,
        handlers::game::start_spin,
        handlers::game::stop_spin,
        handlers::game::cancel,
        handlers::game::select_prize,
        handlers::prize::list_prizes,
        handlers::prize::list_available,
        handlers::prize::get_prize,
        handlers::prize::create_prize,
        handlers::prize::update_prize,
        handlers::prize::delete_prize,
        handlers::participant::list_participants,
        handlers::participant::get_participant,
        handlers::participant::import_participants,
        handlers::participant::reset_participants,
        handlers::events::subscribe,
    ),
    components(
        schemas(
            DrawRequest,
            CancelRequest,
            SelectPrizeRequest,
            DrawEligibility,
            WinnerRecord,
            CreatePrizeRequest,
            UpdatePrizeRequest,
            PrizeResponse,
            PrizeSummaryResponse,
            ParticipantResponse,
            ImportParticipantsResponse,
            ResetParticipantsResponse,
            ApiError,
        )
    ),
    tags(
        (name = "game", description = "Draw control API"),
        (name = "prize", description = "Prize management API"),
        (name = "participant", description = "Participant management API"),
        (name = "events", description = "Realtime event stream"),
    ),
    info(
        title = "Lucky Draw Backend API",
        version = "1.0.0",
        description = "Lucky Draw Backend REST API documentation"
    ),
    servers(
        (url = "/api/v1", description = "Local server")
    )
)]
pub struct ApiDoc;

pub fn swagger_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        SwaggerUi::new("/swagger-ui/{_:.*}").url("/api-docs/openapi.json", ApiDoc::openapi()),
    )
    .route(
        "/swagger-ui",
        web::get().to(|| async {
            actix_web::HttpResponse::Found()
                .append_header(("Location", "/swagger-ui/"))
                .finish()
        }),
    );
}
