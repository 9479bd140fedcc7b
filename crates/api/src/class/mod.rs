mod create_class;
mod get_my_classes;
mod get_my_timetable;
mod get_upcoming_occurrences;
mod upload_timetable;

use actix_web::web;

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    // admin
    cfg.route(
        "/admin/classes",
        web::post().to(create_class::create_class_admin_controller),
    );
    cfg.route(
        "/admin/timetables/upload",
        web::post().to(upload_timetable::upload_timetable_admin_controller),
    );
    cfg.route(
        "/admin/upcoming",
        web::get().to(get_upcoming_occurrences::get_upcoming_occurrences_admin_controller),
    );

    // staff
    cfg.route(
        "/users/me/classes",
        web::get().to(get_my_classes::get_my_classes_controller),
    );
    cfg.route(
        "/users/me/timetable",
        web::get().to(get_my_timetable::get_my_timetable_controller),
    );
}
