//! egui panels for the popup and options surfaces.
//!
//! Panels are immediate-mode functions over plain state structs and return
//! an action enum; the app layer turns actions into controller calls.

pub mod markdown;
pub mod panels;
pub mod state;
pub mod theme;

#[cfg(test)]
mod tests;
