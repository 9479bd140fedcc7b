mod channel_dispatcher;
mod dispatch_due_reminders;
mod get_delivery_logs;
mod send_test_reminder;

pub use dispatch_due_reminders::DispatchDueRemindersUseCase;

use actix_web::web;

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route(
        "/admin/test-reminder",
        web::post().to(send_test_reminder::send_test_reminder_admin_controller),
    );
    cfg.route(
        "/admin/logs",
        web::get().to(get_delivery_logs::get_delivery_logs_admin_controller),
    );
}
