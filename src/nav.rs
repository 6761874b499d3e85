use crate::auth::AuthState;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Route {
    Home,
    Welcome,
    SignIn,
    SignUp,
    Chat,
    History,
    SignOut,
}

impl Route {
    pub const ALL: [Route; 7] = [
        Route::Home,
        Route::Welcome,
        Route::SignIn,
        Route::SignUp,
        Route::Chat,
        Route::History,
        Route::SignOut,
    ];

    /// Stack page name.
    pub fn name(self) -> &'static str {
        match self {
            Route::Home => "home",
            Route::Welcome => "welcome",
            Route::SignIn => "signin",
            Route::SignUp => "signup",
            Route::Chat => "chat",
            Route::History => "history",
            Route::SignOut => "signout",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|r| r.name() == name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NavItem {
    pub route: Route,
    pub label: &'static str,
    pub icon: &'static str,
}

const fn item(route: Route, label: &'static str, icon: &'static str) -> NavItem {
    NavItem { route, label, icon }
}

pub fn nav_items(auth: &AuthState) -> Vec<NavItem> {
    let home = item(Route::Home, "Home", "go-home-symbolic");
    let chatbot = item(Route::Chat, "AI Chatbot", "starred-symbolic");
    if auth.is_authenticated {
        vec![
            home,
            chatbot,
            item(Route::History, "Chat History", "document-open-recent-symbolic"),
            item(Route::SignOut, "Sign Out", "system-log-out-symbolic"),
        ]
    } else {
        vec![
            home,
            item(Route::SignIn, "Sign In", "avatar-default-symbolic"),
            item(Route::SignUp, "Sign Up", "contact-new-symbolic"),
            chatbot,
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn routes(auth: &AuthState) -> Vec<Route> {
        nav_items(auth).into_iter().map(|i| i.route).collect()
    }

    #[test]
    fn signed_out_links() {
        assert_eq!(
            routes(&AuthState::default()),
            vec![Route::Home, Route::SignIn, Route::SignUp, Route::Chat]
        );
    }

    #[test]
    fn signed_in_links_hide_auth_forms() {
        let auth = AuthState { is_authenticated: true, token: Some("t".into()) };
        let routes = routes(&auth);
        assert!(routes.contains(&Route::SignOut));
        assert!(routes.contains(&Route::History));
        assert!(!routes.contains(&Route::SignIn));
    }

    #[test]
    fn names_round_trip() {
        for route in Route::ALL {
            assert_eq!(Route::from_name(route.name()), Some(route));
        }
        assert_eq!(Route::from_name("nope"), None);
    }
}
