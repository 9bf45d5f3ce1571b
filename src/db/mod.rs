pub mod catalogdb;
pub mod db;
pub mod orderdb;
pub mod supportdb;
pub mod userdb;
pub mod walletdb;
pub mod wheeldb;
