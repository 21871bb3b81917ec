//! Authentication state and the always-mounted sign-in modal.

use dioxus::prelude::*;

use crate::modal::ModalOverlay;

/// Client-side authentication state.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AuthState {
    /// Bearer token sent with mutations.
    pub token: Option<String>,
    pub modal_open: bool,
}

impl AuthState {
    pub fn is_signed_in(&self) -> bool {
        self.token.is_some()
    }
}

/// Get the authentication state provided by [`AuthProvider`].
pub fn use_auth() -> Signal<AuthState> {
    use_context::<Signal<AuthState>>()
}

#[component]
pub fn AuthProvider(children: Element) -> Element {
    let auth_state = use_signal(AuthState::default);
    use_context_provider(|| auth_state);

    rsx! {
        {children}
    }
}

/// Sign-in / sign-out toggle for page headers.
#[component]
pub fn AuthButton() -> Element {
    let mut auth = use_auth();

    if auth().is_signed_in() {
        rsx! {
            button {
                class: "secondary",
                onclick: move |_| auth.set(AuthState::default()),
                "Sign out"
            }
        }
    } else {
        rsx! {
            button {
                class: "primary",
                onclick: move |_| auth.write().modal_open = true,
                "Sign in"
            }
        }
    }
}

/// Modal asking for a bearer token. Mounted once at the app root and shown
/// whenever `AuthState::modal_open` is set.
#[component]
pub fn AuthModalContainer() -> Element {
    let mut auth = use_auth();
    let mut draft = use_signal(String::new);

    if !auth().modal_open {
        return rsx! {};
    }

    let submit = move |_| {
        let token = draft().trim().to_string();
        if token.is_empty() {
            return;
        }
        auth.set(AuthState {
            token: Some(token),
            modal_open: false,
        });
        draft.set(String::new());
    };

    rsx! {
        ModalOverlay {
            title: "Sign in",
            on_close: move |_| {
                auth.write().modal_open = false;
                draft.set(String::new());
            },
            div {
                class: "auth-modal",
                p { "Paste a token from " code { "memo-server issue-token <name>" } "." }
                textarea {
                    placeholder: "eyJhbGciOi...",
                    value: draft(),
                    oninput: move |evt| draft.set(evt.value()),
                }
                div {
                    class: "form-actions",
                    button {
                        class: "primary",
                        onclick: submit,
                        "Sign in"
                    }
                    button {
                        class: "secondary",
                        onclick: move |_| {
                            auth.write().modal_open = false;
                            draft.set(String::new());
                        },
                        "Cancel"
                    }
                }
            }
        }
    }
}
