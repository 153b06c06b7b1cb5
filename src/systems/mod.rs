pub mod city;
pub mod export;
pub mod grid;
pub mod interaction;
pub mod ui;
