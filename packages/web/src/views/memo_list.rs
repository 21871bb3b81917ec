use dioxus::prelude::*;

use crate::auth::{use_auth, AuthButton, AuthState};
use crate::client::{self, MemoView};

const PAGE_SIZE: i32 = 10;

#[component]
pub fn MemoListPage() -> Element {
    let mut auth = use_auth();
    let mut memos = use_signal(Vec::<MemoView>::new);
    let mut last_page = use_signal(|| 0);
    let mut loaded_pages = use_signal(|| 0);
    let mut error = use_signal(|| Option::<String>::None);
    let mut draft = use_signal(String::new);

    // Load the newest page on mount
    let _loader = use_resource(move || async move {
        match client::fetch_memos(PAGE_SIZE, None).await {
            Ok(page) => {
                memos.set(page.memos);
                last_page.set(page.last_page);
                loaded_pages.set(1);
            }
            Err(e) => {
                tracing::error!("Failed to load memos: {}", e);
                error.set(Some(e));
            }
        }
    });

    let load_more = move |_| async move {
        let cursor = memos.read().last().map(|m| m.id.clone());
        match client::fetch_memos(PAGE_SIZE, cursor).await {
            Ok(page) => {
                memos.write().extend(page.memos);
                last_page.set(page.last_page);
                *loaded_pages.write() += 1;
            }
            Err(e) => {
                tracing::error!("Failed to load more memos: {}", e);
                error.set(Some(e));
            }
        }
    };

    let submit = move |_| async move {
        let content = draft().trim().to_string();
        if content.is_empty() {
            return;
        }
        let Some(token) = auth().token else {
            auth.write().modal_open = true;
            return;
        };
        match client::create_memo(&token, &content).await {
            Ok(result) => match (result.memo, result.error) {
                (Some(memo), _) => {
                    memos.write().insert(0, memo);
                    draft.set(String::new());
                    error.set(None);
                }
                (None, Some(401)) => {
                    // Token rejected: drop it and ask again
                    auth.set(AuthState {
                        token: None,
                        modal_open: true,
                    });
                }
                (None, status) => {
                    error.set(Some(format!(
                        "Could not create memo (status {})",
                        status.unwrap_or_default()
                    )));
                }
            },
            Err(e) => {
                tracing::error!("Failed to create memo: {}", e);
                error.set(Some(e));
            }
        }
    };

    rsx! {
        div {
            class: "memo-page",

            header {
                h1 { "Memos" }
                AuthButton {}
            }

            if auth().is_signed_in() {
                div {
                    class: "compose",
                    textarea {
                        placeholder: "Write a memo...",
                        value: draft(),
                        oninput: move |evt| draft.set(evt.value()),
                    }
                    div {
                        class: "form-actions",
                        button {
                            class: "primary",
                            onclick: submit,
                            "Post"
                        }
                    }
                }
            }

            if let Some(message) = error() {
                p { class: "error", "{message}" }
            }

            for memo in memos() {
                article {
                    key: "{memo.id}",
                    class: "memo",
                    header {
                        strong { "{memo.writer}" }
                        time { "{memo.created_at}" }
                    }
                    p { "{memo.content}" }
                }
            }

            if memos().is_empty() && error().is_none() {
                p { "No memos yet." }
            }

            footer {
                if loaded_pages() < last_page() {
                    button {
                        class: "secondary",
                        onclick: load_more,
                        "Load more"
                    }
                }
                span { " Page {loaded_pages} of {last_page}" }
            }
        }
    }
}
