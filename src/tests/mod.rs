use super::*;

mod behavior_lazy_images;
mod behavior_validation;
mod bootstrap_and_config;
mod html_parsing;
