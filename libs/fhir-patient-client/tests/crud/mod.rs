mod create;
mod search;
mod update;
