pub mod sku_filters;
