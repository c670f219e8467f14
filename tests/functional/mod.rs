mod api;
mod probe;
