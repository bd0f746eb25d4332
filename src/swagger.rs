use actix_web::web;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::entities::{ActionKind, BoosterType, GiveawayType};
use crate::handlers;
use crate::models::*;

#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::user::ensure_user,
        handlers::user::get_profile,
        handlers::user::get_level,
        handlers::user::get_balance,
        handlers::user::get_rates,
        handlers::user::delete_user,
        handlers::user::get_leaderboard,
        handlers::action::message_event,
        handlers::action::who,
        handlers::action::eight_ball,
        handlers::action::pick,
        handlers::action::rating,
        handlers::action::media,
        handlers::action::list_cooldowns,
        handlers::shop::list_shop,
        handlers::shop::purchase,
        handlers::blackjack::start_round,
        handlers::blackjack::hit,
        handlers::blackjack::stand,
        handlers::giveaway::create_giveaway,
        handlers::giveaway::get_giveaway,
        handlers::giveaway::participate,
        handlers::giveaway::set_message,
        handlers::giveaway::cancel_giveaway,
    ),
    components(
        schemas(
            ActionKind,
            BoosterType,
            GiveawayType,
            EnsureUserRequest,
            UserResponse,
            BalanceResponse,
            RatesResponse,
            LevelResponse,
            XpAwardResponse,
            LeaderboardEntry,
            CooldownEntry,
            MessageEventRequest,
            MessageEventResponse,
            ActorRequest,
            WhoResponse,
            EightBallResponse,
            PickRequest,
            PickResponse,
            MediaKind,
            MediaRequest,
            MediaResponse,
            ShopItemResponse,
            ShopListResponse,
            PurchaseRequest,
            PurchaseResponse,
            StartRoundRequest,
            RoundActionRequest,
            RoundOutcome,
            RoundStateResponse,
            GiftInput,
            CreateGiveawayRequest,
            GiveawayCreatedResponse,
            ParticipateRequest,
            ParticipateResponse,
            GiveawayInfoResponse,
            SetMessageRequest,
            AdminRequest,
            WinnerEntry,
            GiveawaySettlement,
        )
    ),
    tags(
        (name = "user", description = "User and wallet API"),
        (name = "level", description = "Level and leaderboard API"),
        (name = "action", description = "Chat action API"),
        (name = "shop", description = "Booster shop API"),
        (name = "blackjack", description = "Blackjack API"),
        (name = "giveaway", description = "Giveaway API"),
    ),
    info(
        title = "ChatCoin Backend API",
        version = "1.0.0",
        description = "Group chat economy backend REST API documentation"
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
