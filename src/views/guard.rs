use crate::session::Session;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Home,
    Login,
    Dashboard,
    Search,
    Workspace,
    Chat,
}

impl Route {
    pub fn is_protected(&self) -> bool {
        matches!(
            self,
            Route::Dashboard | Route::Search | Route::Workspace | Route::Chat
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Navigation {
    Render(Route),
    Redirect(Route),
}

/// 每次导航前求值
pub struct RouteGuard;

impl RouteGuard {
    pub fn resolve(route: Route, authenticated: bool) -> Navigation {
        match route {
            Route::Login if authenticated => Navigation::Redirect(Route::Dashboard),
            r if r.is_protected() && !authenticated => Navigation::Redirect(Route::Login),
            r => Navigation::Render(r),
        }
    }

    pub fn navigate(route: Route, session: &Session) -> Navigation {
        Self::resolve(route, session.is_authenticated())
    }
}
