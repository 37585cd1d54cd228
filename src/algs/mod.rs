//! Topology algorithms: division reconciliation and face orientation.

pub mod orientation;
pub mod reconcile;

pub use orientation::{corner_map, insert_face, place_face, slot_for};
pub use reconcile::{
    harmonize_divisions, homologous_edges, set_element_size, set_face_element_size_i,
    set_face_element_size_j, set_face_ndiv_i, set_face_ndiv_j, set_ndiv, set_ndiv_homologous,
};
