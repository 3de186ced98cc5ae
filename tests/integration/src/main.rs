mod helpers;

mod zones;
