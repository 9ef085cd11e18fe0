use std::time::Duration;

use leptos::prelude::*;

const TOAST_TTL: Duration = Duration::from_millis(2500);

/// Shows `message` and clears it again after a short delay.
pub fn notify(message: RwSignal<Option<String>>, text: impl Into<String>) {
	message.set(Some(text.into()));
	set_timeout(move || message.set(None), TOAST_TTL);
}

#[component]
pub fn Toast(#[prop(into)] message: Signal<Option<String>>) -> impl IntoView {
	move || {
		message
			.get()
			.map(|text| view! { <div class="toast" role="status">{text}</div> })
	}
}
