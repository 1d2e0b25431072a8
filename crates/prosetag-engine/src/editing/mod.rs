/*!
 * # Editing Core Module
 *
 * The edit pipeline that keeps classification current.
 *
 * ## Architecture
 *
 * ### 1. Single Source of Truth: xi-rope Buffer
 * - The entire document is stored in a single **`xi_rope::Rope`** buffer
 * - Provides efficient insert/delete operations and **Delta** representation of edits
 * - Classification tags are derived state, never part of the saved content
 *
 * ### 2. Command-Based Editing
 * - All edits are represented as **Commands** (`Cmd` enum) that compile to **Deltas**
 * - Commands are applied immediately and synchronously; the classifier runs to
 *   completion inside `Document::apply` before any consumer sees the tag store
 *
 * ### 3. Tag Transformation
 * - Tag offsets are transformed through each Delta so marks outside the edited
 *   range stay attached to the text they describe
 * - Tags inside the edited range are recomputed by the classifier
 *
 * ### 4. Host Re-scan Hook
 * - After every tag update the changed range is handed to the registered
 *   [`Rescan`] implementation so the host's tokenizer can re-tokenize
 *   structured-expression syntax consistently with the new tags
 *
 * ## Module Structure
 *
 * - **`document`**: Core `Document` type owning buffer, tags, and oracle
 * - **`commands`**: `Cmd` enum and delta compilation logic
 * - **`patch`**: Edit result metadata including changed ranges and new selection
 * - **`rescan`**: The opaque host tokenizer re-scan interface
 */

// Module exports
pub mod commands;
pub mod document;
pub mod patch;
pub mod rescan;

// Public API re-exports
pub use commands::Cmd;
pub use document::Document;
pub use patch::Patch;
pub use rescan::Rescan;
