use crate::models::MockUser;
use crate::storage::KeyValueStore;
use crate::traits::MessageHandler;

/// Storage key holding the JSON-serialized mock user
pub const USER_KEY: &str = "github_user";

/// Clickable controls the widget can be bound to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control {
    Login,
    Logout,
}

/// Regions repainted on every state change
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Region {
    /// Shown while logged out (holds the login button)
    LoginSection,
    /// Shown while logged in (holds the user label and logout button)
    UserSection,
}

/// UI binding the widget paints into. Controls may be absent.
pub trait LoginView {
    fn has_control(&self, control: Control) -> bool;
    fn set_visible(&mut self, region: Region, visible: bool);
    fn show_user(&mut self, user: Option<&MockUser>);
}

/// Mock GitHub login. No network traffic: login just stores a placeholder user.
pub struct SocialLoginWidget<S, V> {
    store: S,
    view: V,
    current_user: Option<MockUser>,
    login_bound: bool,
    logout_bound: bool,
}

impl<S: KeyValueStore, V: LoginView> SocialLoginWidget<S, V> {
    /// Restores the user from storage, binds whichever controls exist and paints the view
    pub fn new(store: S, view: V) -> Self {
        let current_user = load_user(&store);
        let login_bound = view.has_control(Control::Login);
        let logout_bound = view.has_control(Control::Logout);
        tracing::debug!(
            "Social login widget bound: login={}, logout={}",
            login_bound,
            logout_bound
        );

        let mut widget = SocialLoginWidget {
            store,
            view,
            current_user,
            login_bound,
            logout_bound,
        };
        widget.render();
        widget
    }

    // TODO: replace the placeholder with a real GitHub OAuth exchange
    pub fn login(&mut self) {
        let user = MockUser::placeholder();

        match serde_json::to_string(&user) {
            Ok(json) => {
                if let Err(e) = self.store.set(USER_KEY, &json) {
                    tracing::warn!("Failed to persist mock user: {:?}", e);
                }
            }
            Err(e) => tracing::warn!("Failed to serialize mock user: {}", e),
        }

        tracing::info!("Mock GitHub login as {}", user.username);
        self.current_user = Some(user);
        self.render();
    }

    pub fn logout(&mut self) {
        if let Err(e) = self.store.remove(USER_KEY) {
            tracing::warn!("Failed to remove mock user from storage: {:?}", e);
        }
        self.current_user = None;
        tracing::info!("Mock GitHub logout");
        self.render();
    }

    pub fn is_authenticated(&self) -> bool {
        self.current_user.is_some()
    }

    pub fn get_user(&self) -> Option<&MockUser> {
        self.current_user.as_ref()
    }

    /// Dispatches a control activation. Returns false when the control was
    /// not present at construction and the activation was ignored.
    pub fn handle(&mut self, control: Control) -> bool {
        match control {
            Control::Login if self.login_bound => self.login(),
            Control::Logout if self.logout_bound => self.logout(),
            _ => {
                tracing::debug!("Ignoring {:?}: control is not bound", control);
                return false;
            }
        }
        true
    }

    pub fn view(&self) -> &V {
        &self.view
    }

    fn render(&mut self) {
        let logged_in = self.current_user.is_some();
        self.view.set_visible(Region::LoginSection, !logged_in);
        self.view.set_visible(Region::UserSection, logged_in);
        self.view.show_user(self.current_user.as_ref());
    }
}

fn load_user<S: KeyValueStore>(store: &S) -> Option<MockUser> {
    match store.get(USER_KEY) {
        Ok(Some(json)) => match serde_json::from_str(&json) {
            Ok(user) => Some(user),
            Err(e) => {
                tracing::warn!("Stored mock user is unreadable, ignoring it: {}", e);
                None
            }
        },
        Ok(None) => None,
        Err(e) => {
            tracing::warn!("Failed to read mock user from storage: {:?}", e);
            None
        }
    }
}

/// Terminal rendition of the login view. Both controls are always present.
pub struct TerminalView<'a> {
    messages: &'a dyn MessageHandler,
}

impl<'a> TerminalView<'a> {
    pub fn new(messages: &'a dyn MessageHandler) -> Self {
        TerminalView { messages }
    }
}

impl LoginView for TerminalView<'_> {
    fn has_control(&self, _control: Control) -> bool {
        true
    }

    fn set_visible(&mut self, region: Region, visible: bool) {
        tracing::trace!("{:?} visible={}", region, visible);
    }

    fn show_user(&mut self, user: Option<&MockUser>) {
        match user {
            Some(user) => self
                .messages
                .print(&format!("Logged in to GitHub as {} (@{})", user.name, user.username)),
            None => self.messages.print("Not logged in to GitHub"),
        }
    }
}
