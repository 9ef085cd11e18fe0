use std::rc::Rc;

use leptos::ev::{KeyboardEvent, MouseEvent, SubmitEvent};
use leptos::prelude::*;

use super::types::Submission;

/// Modal asking for the question (edge label) and answer (node label).
/// Only complete submissions are passed on; blank fields are reported inline.
#[component]
pub fn EntryForm(
	#[prop(into)] open: Signal<bool>,
	on_submit: impl Fn(Submission) + 'static,
	on_cancel: impl Fn() + 'static,
) -> impl IntoView {
	let question = RwSignal::new(String::new());
	let answer = RwSignal::new(String::new());
	let problem = RwSignal::new(None::<String>);
	let reset = move || {
		question.set(String::new());
		answer.set(String::new());
		problem.set(None);
	};

	let handle_submit = move |ev: SubmitEvent| {
		ev.prevent_default();
		match Submission::new(&question.get_untracked(), &answer.get_untracked()) {
			Ok(submission) => {
				reset();
				on_submit(submission);
			}
			Err(err) => problem.set(Some(err.to_string())),
		}
	};

	let on_cancel = Rc::new(on_cancel);
	let cancel_click = on_cancel.clone();
	let handle_cancel = move |_: MouseEvent| {
		reset();
		cancel_click();
	};
	let handle_keydown = move |ev: KeyboardEvent| {
		if ev.key() == "Escape" {
			reset();
			on_cancel();
		}
	};

	view! {
		<div
			class="entry-form-backdrop"
			style:display=move || if open.get() { "flex" } else { "none" }
			on:keydown=handle_keydown
		>
			<form class="entry-form" on:submit=handle_submit>
				<h2>"Add a step"</h2>
				<label>
					"Question"
					<input
						type="text"
						placeholder="is it urgent?"
						prop:value=move || question.get()
						on:input=move |ev| question.set(event_target_value(&ev))
					/>
				</label>
				<label>
					"Answer"
					<input
						type="text"
						placeholder="yes"
						prop:value=move || answer.get()
						on:input=move |ev| answer.set(event_target_value(&ev))
					/>
				</label>
				{move || problem.get().map(|p| view! { <p class="entry-form-error">{p}</p> })}
				<div class="entry-form-actions">
					<button type="button" on:click=handle_cancel>
						"Cancel"
					</button>
					<button type="submit">"OK"</button>
				</div>
			</form>
		</div>
	}
}
