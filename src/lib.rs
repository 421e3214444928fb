pub mod actions;

pub mod client;

pub mod config;

pub mod notify;

pub mod session;

pub mod ui;

pub mod views;

pub mod wallets;
