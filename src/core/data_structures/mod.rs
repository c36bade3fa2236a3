/*!
 * Data Structures
 * Small value types shared across the kernel
 */

mod inline_string;

pub use inline_string::InlineString;
