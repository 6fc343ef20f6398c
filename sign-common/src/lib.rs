pub mod cache;

pub mod config;

pub mod data_source;

pub mod signapi;

pub mod slides;

pub mod timezone;
