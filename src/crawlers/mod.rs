pub mod app;
pub mod controller;
pub mod crawler;
pub mod web;

#[cfg(test)]
mod tests;
