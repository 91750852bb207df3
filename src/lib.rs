use crate::context::AppContext;
use crate::forms::login::LoginForm;
use crate::models::config::AppConfig;
use crate::repository::HttpRepository;
use crate::services::clients::ClientsScreen;
use crate::services::dashboard::DashboardScreen;
use crate::services::screen::ScreenEvent;

pub mod context;
pub mod domain;
pub mod dto;
mod error_conversions;
pub mod forms;
pub mod models;
pub mod repository;
pub mod routes;
pub mod services;
pub mod storage;

/// Logs in with the configured operator, then prints the dashboard figures
/// and the client list.
pub async fn run(config: AppConfig) -> std::io::Result<()> {
    let repo = HttpRepository::new(&config.api)
        .map_err(|e| std::io::Error::other(format!("Failed to build HTTP client: {e}")))?;
    let mut ctx = AppContext::in_memory();

    let credentials = LoginForm {
        username: config.username.clone(),
        password: config.password.clone(),
    };
    if !ctx.session.login(&repo, &credentials).await {
        return Err(std::io::Error::other("Login rejected by the API"));
    }

    let mut dashboard = DashboardScreen::mount(&ctx)
        .map_err(|route| std::io::Error::other(format!("Redirected to {route}")))?;
    dashboard
        .refresh(&repo)
        .await
        .map_err(|e| std::io::Error::other(e.to_string()))?;
    let view = dashboard.view();

    println!("Importo ricevuto:     {}", view.amount_received);
    println!("Importo da ricevere:  {}", view.amount_outstanding);
    println!("Importo totale:       {}", view.amount_total);
    println!("Efficienza budget:    {}%", view.budget_efficiency);
    println!("Tasso completamento:  {}%", view.completion_rate);
    println!("Lavori totali:        {}", view.total_jobs);
    for slice in &view.breakdown {
        println!("  {:<12} {:>4} ({}%)", slice.label, slice.count, slice.share);
    }

    let mut clients = ClientsScreen::mount_and_load(&ctx, None, &repo)
        .await
        .map_err(|route| std::io::Error::other(format!("Redirected to {route}")))?;
    for event in clients.drain_events() {
        if let ScreenEvent::Notified(notification) = event {
            log::warn!(
                "{}: {}",
                notification.title,
                notification.description.as_deref().unwrap_or_default()
            );
        }
    }

    println!();
    println!("Clienti ({}):", clients.items().len());
    for client in clients.items() {
        println!(
            "  [{}] {} <{}> {}",
            client.id,
            client.full_name(),
            client.email,
            client.mobile_phone
        );
    }

    ctx.logout();
    Ok(())
}
