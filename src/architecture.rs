/// The following diagram shows how a call flows from an application through the library down
/// to a storage backend.
#[cfg_attr(doc, aquamarine::aquamarine)]
/// ```mermaid
/// graph TB
///     subgraph Application
///         App
///         postgres[Postgres backend]
///     end
///     App-- "op(key)" --> plain
///     App-- "op_for_period(key, period)" --> decompose
///     postgres-. impl .- repository
///     subgraph Period Counter
///         subgraph Counter
///             plain[unscoped operation]
///             decompose-- no moments --> noop[no call]
///             decompose-- one moment --> dated[dated operation]
///             decompose-- "n moments" --> ranged["n - 1 ranged operations"]
///         end
///         repository>Repository]
///         plain --> repository
///         dated --> repository
///         ranged --> repository
///         memory[InMemoryRepository]-. default impl .- repository
///         memory --> slots
///         slots["standard:key | date:key_ts | range:key_ts_ts"]
///     end
/// ```
///
/// Applications only talk to [`Counter`](crate::Counter). The period scoped operations go
/// through [`decompose`](crate::decompose) which decides between the dated and the ranged
/// variants of the [`Repository`](crate::Repository) methods.
///
/// [`InMemoryRepository`](crate::InMemoryRepository) keeps every value in one map; the three
/// key spaces are told apart by the namespace prefix of the slot, see
/// [`storage::common`](crate::storage::common).
pub struct Diagram;
