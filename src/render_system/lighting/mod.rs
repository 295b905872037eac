pub mod spinning;
