//! Client-side behaviour for a single-page portfolio site.
//!
//! This crate is compiled to WebAssembly and loaded by the portfolio page. It
//! installs theme switching, scroll effects, smooth in-page navigation, the
//! mobile menu overlay, the contact form, toast notifications, scroll-reveal
//! animation, active-link highlighting and the page fade-in. Every behaviour is
//! written against the [`host::Host`] capability trait, so the logic runs and
//! is tested natively; the `browser` feature supplies the web-sys host and the
//! `#[wasm_bindgen(start)]` entry point.
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`app`] | Boot sequence and per-behaviour install report |
//! | [`host`] | Capability trait and its value types |
//! | [`config`] | Page-supplied [`config::Settings`] with stock defaults |
//! | [`theme`] | Dark/light theme state and persistence |
//! | [`scroll`] | Navbar shadow, progress bar and anchor scrolling |
//! | [`menu`] | Mobile navigation overlay |
//! | [`contact`] | Contact form capture |
//! | [`notify`] | Toast notification lifecycle |
//! | [`reveal`] | Section reveal and skill bar fill |
//! | [`nav`] | Active navigation link tracking |
//! | [`fade`] | Page fade-in on load |
//! | [`cards`] | Project card hover lift |
//! | [`error`] | Host and setup error types |
//! | [`consts`] | Markup selectors, class names and style values |

pub mod app;
pub mod cards;
pub mod config;
pub mod consts;
pub mod contact;
pub mod error;
pub mod fade;
pub mod host;
pub mod menu;
pub mod nav;
pub mod notify;
pub mod reveal;
pub mod scroll;
pub mod theme;

#[cfg(feature = "browser")]
pub mod browser;

#[cfg(test)]
mod fake_host;
