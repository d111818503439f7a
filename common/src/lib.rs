pub mod macros;

agg_mod![config, models, progress, supabase];
