oxc_index::define_index_type! {
  /// Position of a module in the module graph arena.
  pub struct ModuleIdx = u32;
}

oxc_index::define_index_type! {
  pub struct ChunkIdx = u32;
}
