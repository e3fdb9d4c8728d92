mod connect;
mod connectivity;
mod isomorphism;
mod sssr;
