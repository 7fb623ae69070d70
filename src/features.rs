/// Capabilities of the property-graph surface.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Features {
    pub supports_duplicate_edges: bool,
    pub supports_self_loops: bool,
    pub is_persistent: bool,
    pub supports_vertex_iteration: bool,
    pub supports_edge_iteration: bool,
    pub ignores_supplied_ids: bool,
    pub supports_edge_retrieval: bool,
    pub supports_vertex_properties: bool,
    pub supports_edge_properties: bool,
    /// Transactions end by commit only.
    pub supports_transactions: bool,
    pub supports_threaded_transactions: bool,
    pub supports_boolean_property: bool,
    pub supports_integer_property: bool,
    pub supports_long_property: bool,
    pub supports_float_property: bool,
    pub supports_double_property: bool,
    pub supports_string_property: bool,
    pub supports_list_property: bool,
    pub supports_map_property: bool,
    pub supports_key_indices: bool,
    pub supports_vertex_key_index: bool,
    pub supports_edge_key_index: bool,
}

pub const FEATURES: Features = Features {
    supports_duplicate_edges: true,
    supports_self_loops: true,
    is_persistent: true,
    supports_vertex_iteration: true,
    supports_edge_iteration: true,
    ignores_supplied_ids: true,
    supports_edge_retrieval: true,
    supports_vertex_properties: true,
    supports_edge_properties: true,
    supports_transactions: false,
    supports_threaded_transactions: false,
    supports_boolean_property: true,
    supports_integer_property: true,
    supports_long_property: true,
    supports_float_property: true,
    supports_double_property: true,
    supports_string_property: true,
    supports_list_property: false,
    supports_map_property: false,
    supports_key_indices: true,
    supports_vertex_key_index: true,
    supports_edge_key_index: true,
};
