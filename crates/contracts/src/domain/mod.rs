pub mod a001_product;
pub mod a002_supply;
pub mod a003_offer;
pub mod a004_policy;
pub mod a005_filter_group;
pub mod a006_service;
pub mod a007_page_content;
pub mod a008_hero_slide;
pub mod common;
