/*!
 * Translation helpers shared by the card builder.
 *
 * - `cache`: in-memory cache and the caching translator wrapper
 * - `alternatives`: merging of `" / "`-separated alternative translations
 */

pub use self::alternatives::{dedup_alternatives, merge_alternatives, ALTERNATIVE_SEPARATOR};
pub use self::cache::{CacheStats, CachedTranslator, TranslationCache};

pub mod alternatives;
pub mod cache;
