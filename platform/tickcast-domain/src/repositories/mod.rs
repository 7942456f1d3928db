pub mod price_sink;
