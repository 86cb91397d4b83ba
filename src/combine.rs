/// How the partial results of all chunks are combined into the final Top-K
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Combine {
    /// Concatenate all partial results and select once on the calling thread
    #[default]
    Sequential,
    /// Merge partial results pairwise on a pool of worker threads
    Parallel,
}
