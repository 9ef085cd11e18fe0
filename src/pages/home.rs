use leptos::prelude::*;

use crate::components::flow_canvas::{FlowCanvas, GraphSnapshot};

/// Default Home Page
#[component]
pub fn Home() -> impl IntoView {
	// Node and edge counts, refreshed whenever the canvas reports a change.
	let counts = RwSignal::new((1usize, 0usize));
	let on_change = Callback::new(move |snapshot: GraphSnapshot| {
		counts.set((snapshot.nodes.len(), snapshot.edges.len()));
	});

	view! {
		<ErrorBoundary fallback=|errors| {
			view! {
				<h1>"Uh oh! Something went wrong!"</h1>

				<p>"Errors: "</p>
				<ul>
					{move || {
						errors
							.get()
							.into_iter()
							.map(|(_, e)| view! { <li>{e.to_string()}</li> })
							.collect_view()
					}}
				</ul>
			}
		}>

			<div class="fullscreen-graph">
				<FlowCanvas fullscreen=true on_change=on_change />
				<div class="graph-overlay">
					<h1>"Flow Designer"</h1>
					<p class="subtitle">
						"Right-click near a node to add a step. Drag between handles to connect. Scroll to zoom."
					</p>
					<p class="stats">
						{move || {
							let (nodes, edges) = counts.get();
							format!("{nodes} nodes, {edges} edges")
						}}
					</p>
				</div>
			</div>
		</ErrorBoundary>
	}
}
