#![allow(non_snake_case)]

mod support;

mod controller;
mod game_flows;
mod poap_flows;
mod session;
mod views;
