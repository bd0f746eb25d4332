use actix_web::{App, HttpServer, middleware::Logger, web};
use chrono::Local; // timestamp in log lines
use env_logger::{Env, Target};
use std::io::Write; // for env_logger custom formatter
use std::sync::Arc;

use chatcoin_backend::{
    config::Config,
    database::{create_pool, run_migrations},
    handlers,
    middlewares::create_cors,
    outbound::{OutboundQueue, spawn_log_drain},
    services::*,
    swagger::swagger_config,
    tasks,
};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info"))
        .format(|buf, record| {
            let ts = Local::now().format("%Y-%m-%dT%H:%M:%S%.3f%:z");
            let level = record.level().as_str().to_ascii_lowercase();
            let msg_json = serde_json::to_string(&format!("{}", record.args()))
                .unwrap_or_else(|_| "\"<invalid utf8>\"".to_string());
            writeln!(
                buf,
                "{{\"timestamp\":\"{}\",\"level\":\"{}\",\"message\":{},\"target\":\"{}\"}}",
                ts,
                level,
                msg_json,
                record.target(),
            )
        })
        .target(Target::Stdout)
        .init();

    // 加载配置
    let config = Config::from_toml().expect("Failed to load configuration file");

    // 创建数据库连接池, 以 Arc 在各服务间共享
    let pool = Arc::new(
        create_pool(&config.database)
            .await
            .expect("Failed to create database connection pool"),
    );

    // 运行数据库迁移
    run_migrations(&pool)
        .await
        .expect("Failed to run database migrations");

    // 创建服务
    let user_service = UserService::new(pool.clone(), config.economy.clone());
    let level_service = LevelService::new(pool.clone(), config.economy.clone());
    let cooldown_service = CooldownService::new(pool.clone());
    let shop_service = ShopService::new(pool.clone());
    let blackjack_service = BlackjackService::new(user_service.clone(), config.economy.min_bet);
    let giveaway_service = GiveawayService::new(pool.clone(), config.economy.clone());

    // 播种冷却配置与加成器目录
    cooldown_service
        .seed(&config.cooldowns)
        .await
        .expect("Failed to seed cooldown config");
    shop_service
        .seed_catalog()
        .await
        .expect("Failed to seed booster catalog");

    // 出站公告队列; 未接 transport 时由日志消费者兜底
    let (outbound, outbound_rx) = OutboundQueue::new();
    spawn_log_drain(outbound_rx);

    // 后台任务: 每分钟被动收入 + 恢复未开奖活动的等待任务
    tasks::spawn_all(
        user_service.clone(),
        giveaway_service.clone(),
        outbound.clone(),
    )
    .await;

    // 启动HTTP服务器
    log::info!(
        "Starting HTTP server at {}:{}",
        config.server.host,
        config.server.port
    );

    let server_config = config.clone();
    HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .wrap(create_cors())
            .app_data(web::Data::new(server_config.clone()))
            .app_data(web::Data::new(user_service.clone()))
            .app_data(web::Data::new(level_service.clone()))
            .app_data(web::Data::new(cooldown_service.clone()))
            .app_data(web::Data::new(shop_service.clone()))
            .app_data(web::Data::new(blackjack_service.clone()))
            .app_data(web::Data::new(giveaway_service.clone()))
            .app_data(web::Data::new(outbound.clone()))
            .configure(swagger_config)
            .service(
                web::scope("/api/v1")
                    .configure(handlers::user_config)
                    .configure(handlers::action_config)
                    .configure(handlers::shop_config)
                    .configure(handlers::blackjack_config)
                    .configure(handlers::giveaway_config),
            )
    })
    .bind((config.server.host.as_str(), config.server.port))?
    .run()
    .await
}
