use dioxus::prelude::*;

/// Accessible dialog shell for the always-mounted auth modal.
///
/// Renders `title` as the dialog heading and labels the card with it.
/// A backdrop click or the Escape key calls `on_close`; clicks inside the card
/// stay inside.
#[component]
pub fn ModalOverlay(
    #[props(into)] title: String,
    on_close: EventHandler<()>,
    children: Element,
) -> Element {
    rsx! {
        div {
            class: "modal-backdrop",
            onclick: move |_| on_close.call(()),
            onkeydown: move |evt: Event<KeyboardData>| {
                if evt.key() == Key::Escape {
                    on_close.call(());
                }
            },
            section {
                class: "modal-card",
                role: "dialog",
                aria_modal: "true",
                aria_labelledby: "modal-title",
                onclick: move |evt: Event<MouseData>| evt.stop_propagation(),
                h2 { id: "modal-title", "{title}" }
                {children}
            }
        }
    }
}
