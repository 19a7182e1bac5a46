pub mod force_graph;
pub mod node_details;
pub mod selection_panel;
