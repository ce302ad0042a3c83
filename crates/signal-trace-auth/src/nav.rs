/*
[INPUT]:  Navigation requests from flows and the 401 interceptor
[OUTPUT]: Route pushes delivered to the host application's router
[POS]:    Integration seam - the crate never renders, it only asks to navigate
[UPDATE]: When the site's auth-related routes change
*/

use std::fmt;
use std::sync::Mutex;

/// Auth-related site routes the client can request navigation to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    SignIn,
    SignUp,
    SignupVerify,
    ForgotPassword,
    ForgotPasswordVerify,
    ResetPassword,
    Profile,
}

impl Route {
    /// Site path for this route.
    pub fn path(&self) -> &'static str {
        match self {
            Route::SignIn => "/signin",
            Route::SignUp => "/signup",
            Route::SignupVerify => "/signup/verify",
            Route::ForgotPassword => "/forgotpassword",
            Route::ForgotPasswordVerify => "/forgotpassword/verify",
            Route::ResetPassword => "/resetpassword",
            Route::Profile => "/profile",
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

/// Router seam implemented by the host application.
pub trait Navigator: Send + Sync + fmt::Debug {
    fn push(&self, route: Route);
}

/// Navigator that drops every request; useful for headless usage.
#[derive(Debug, Default)]
pub struct NoopNavigator;

impl Navigator for NoopNavigator {
    fn push(&self, _route: Route) {}
}

/// Navigator that records pushes for assertions in tests.
#[derive(Debug, Default)]
pub struct RecordingNavigator {
    routes: Mutex<Vec<Route>>,
}

impl RecordingNavigator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Routes pushed so far, in order.
    pub fn pushed(&self) -> Vec<Route> {
        self.routes.lock().unwrap().clone()
    }

    pub fn last(&self) -> Option<Route> {
        self.routes.lock().unwrap().last().copied()
    }
}

impl Navigator for RecordingNavigator {
    fn push(&self, route: Route) {
        self.routes.lock().unwrap().push(route);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recording_navigator_keeps_order() {
        let nav = RecordingNavigator::new();
        nav.push(Route::SignIn);
        nav.push(Route::Profile);
        assert_eq!(nav.pushed(), vec![Route::SignIn, Route::Profile]);
        assert_eq!(nav.last(), Some(Route::Profile));
    }

    #[test]
    fn route_paths_match_site_layout() {
        assert_eq!(Route::ForgotPassword.path(), "/forgotpassword");
        assert_eq!(Route::SignupVerify.path(), "/signup/verify");
    }
}
