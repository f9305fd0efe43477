pub mod force_graph;
pub mod graph_explorer;
