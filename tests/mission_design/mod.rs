mod cargo;
mod config;
mod spiral;
mod stop;
mod waypoints;
