/*! Emitters that turn vflow query results into human or machine output.
 *
 * The query layer hands over plain report structs; everything about how they
 * look (indentation, color, JSON) lives here.
 */

pub mod emitter;
pub mod json;
pub mod text;

pub use emitter::{EmitContext, EmitResult, Emitter};
pub use json::JsonReportEmitter;
pub use text::{format_alias, format_points_to, TextReportEmitter};
