
mod read_bad;
