pub(crate) mod fixtures;
mod html_node_tests;
