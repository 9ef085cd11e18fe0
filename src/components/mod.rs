pub mod flow_canvas;
pub mod toast;
