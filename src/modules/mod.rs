pub mod recon;
