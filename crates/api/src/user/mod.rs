mod create_user;
mod get_users;
mod set_preferences;

use actix_web::web;

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    // admin
    cfg.route(
        "/admin/users",
        web::post().to(create_user::create_user_admin_controller),
    );
    cfg.route(
        "/admin/users",
        web::get().to(get_users::get_users_admin_controller),
    );

    // staff
    cfg.route(
        "/users/me/preferences",
        web::put().to(set_preferences::set_preferences_controller),
    );
}
