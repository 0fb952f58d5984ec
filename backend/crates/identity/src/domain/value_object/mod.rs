pub mod trader_name;
