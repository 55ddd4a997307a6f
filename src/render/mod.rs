//! Rendering: conversion options and the HTML, JSON and statistics outputs.

pub mod html;
mod json;
mod options;
mod result;

pub use html::{escape_attr, register_renderers, PLACEHOLDER_GIF};
pub use json::{from_json, to_json, JsonFormat};
pub use options::{
    Colors, ColorsPatch, ConvertOptions, OptionsPatch, SchemeLists, UrlPrefix, DEFAULT_SCHEMES,
};
pub use result::{ConversionStats, ConvertResult};
