use campanile_api::Application;
use campanile_infra::{Config, Context};

pub struct TestApp {
    pub config: Config,
    pub address: String,
    pub api_key: String,
}

// Launch the application as a background task against in-memory repos
pub async fn spawn_app() -> (TestApp, reqwest::Client) {
    let mut ctx = Context::create_inmemory();
    ctx.config.port = 0; // Random port

    let config = ctx.config.clone();
    let api_key = config.admin_api_key.clone();
    let application = Application::new(ctx)
        .await
        .expect("Failed to build application.");

    let address = format!("http://localhost:{}", application.port());
    let _ = actix_web::rt::spawn(async move {
        application
            .start()
            .await
            .expect("Expected application to start");
    });

    let app = TestApp {
        config,
        address,
        api_key,
    };
    (app, reqwest::Client::new())
}
