/// HTTP request handlers
pub mod posts;

use actix_web::web;

/// Mount all post routes. Shared between `main` and the test harness.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/posts")
            .route("", web::get().to(posts::list_posts))
            .route("", web::post().to(posts::create_post))
            .route("/{id}", web::get().to(posts::get_post))
            .route("/{id}", web::delete().to(posts::delete_post))
            .route("/{id}/like", web::put().to(posts::like_post))
            .route("/{id}/unlike", web::put().to(posts::unlike_post))
            .route("/{id}/comments", web::post().to(posts::add_comment))
            .route(
                "/{id}/comments/{comment_id}",
                web::delete().to(posts::remove_comment),
            ),
    );
}
