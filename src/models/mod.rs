pub mod catalogmodels;
pub mod ordermodels;
pub mod supportmodel;
pub mod usermodel;
pub mod walletmodels;
pub mod wheelmodels;
