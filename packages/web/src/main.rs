use dioxus::prelude::*;

use auth::{AuthModalContainer, AuthProvider};
use views::{MemoListPage, NotFoundPage};

mod auth;
mod client;
mod modal;
mod views;

#[derive(Debug, Clone, Routable, PartialEq)]
#[rustfmt::skip]
enum Route {
    #[route("/")]
    MemoListPage {},
    #[route("/:..segments")]
    NotFoundPage { segments: Vec<String> },
}

const MAIN_CSS: Asset = asset!("/assets/main.css");

fn main() {
    dioxus::launch(App);
}

#[component]
fn App() -> Element {
    rsx! {
        document::Stylesheet { href: MAIN_CSS }

        AuthProvider {
            Router::<Route> {}
            AuthModalContainer {}
        }
    }
}
