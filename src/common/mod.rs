pub fn init() {
    static INIT: std::sync::Once = std::sync::Once::new();
    INIT.call_once(|| {
        color_eyre::install().unwrap();
        let _ = tracing_subscriber::fmt()
            .with_env_filter("git_info_rs=debug")
            .with_test_writer()
            .try_init();
    });
}
