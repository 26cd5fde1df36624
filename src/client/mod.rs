//! Client-side view model for a post card: the state a front end keeps while
//! showing one post with its comment thread, and the calls it makes against
//! the `/api/posts` routes.

pub mod api;
pub mod post_card;
