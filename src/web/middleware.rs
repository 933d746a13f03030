//! Session provider middleware: mounts a provider for the request, runs its
//! single hydration cycle, and injects the settled store handle before any
//! handler runs. One request is one mount; requests never share a store.

use crate::auth::cookies::{self, TOKEN_COOKIE};
use crate::session::provider::SessionProvider;
use crate::web::AppState;
use axum::{extract::Request, middleware::Next, response::Response, Extension};

pub async fn provide_session(
    Extension(state): Extension<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    let token = cookies::extract(request.headers(), TOKEN_COOKIE);

    let mut provider = SessionProvider::new();
    provider.hydrate(&state.exchange, token.as_deref()).await;

    request.extensions_mut().insert(provider.handle());
    next.run(request).await
}
